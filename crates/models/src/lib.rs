//! Domain vocabulary shared by the marketplace crates: statuses, money math,
//! public codes and curriculum payloads.

pub mod codes;
pub mod curriculum;
pub mod money;
pub mod status;
pub mod text;
