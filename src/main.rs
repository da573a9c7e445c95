// Copyright 2025 the Penpath Authors
// SPDX-License-Identifier: Apache-2.0

//! Penpath: replay a pen tool input script and print the resulting path

fn main() -> anyhow::Result<()> {
    penpath::run()
}
