//! Wire format types for backend APIs
//!
//! Each module contains pure serde structs matching one backend family's JSON
//! format. They only exist at the encode/decode boundary.

pub mod anthropic;
pub mod google;
pub mod openai;
