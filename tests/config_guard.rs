// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use regex::Regex;
use std::fs;
use std::path::Path;

/// Fail CI if config files carry 64-hex private keys for the admin identity.
#[test]
fn no_committed_hex_keys_in_configs() {
    let re = Regex::new(r"0x?[a-fA-F0-9]{64}").unwrap();
    let candidates = ["config.toml", "config.example.toml", ".env"];
    for file in candidates {
        if !Path::new(file).exists() {
            continue;
        }
        let body = fs::read_to_string(file).expect("read config");
        for (idx, line) in body.lines().enumerate() {
            if re.is_match(line) {
                panic!("Secret-looking hex in {} at line {}", file, idx + 1);
            }
        }
    }
}

/// The shipped example must name every identity the engine needs.
#[test]
fn example_config_names_required_identities() {
    let body = fs::read_to_string("config.example.toml").expect("read example config");
    let key = Regex::new(r"(?m)^\s*([a-z_]+)\s*=").unwrap();
    let keys: Vec<&str> = key
        .captures_iter(&body)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    for required in ["admin_address", "engine_address", "registry_address", "split_ratio_bits"] {
        assert!(keys.contains(&required), "config.example.toml is missing {required}");
    }
}
