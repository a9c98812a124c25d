// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

pub mod codec;
pub mod constants;
pub mod error;
pub mod hint;
pub mod route;
pub mod split;
