//! Input report parsers
//!
//! One module per input format. JUnit XML is currently the only
//! supported report format.

pub mod junit;
