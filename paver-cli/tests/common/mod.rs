#![allow(dead_code)]

use assert_cmd::Command;

pub fn paver() -> Command {
    Command::new(env!("CARGO_BIN_EXE_paver"))
}
