//! Document parsing utilities
//!
//! This module contains the heuristics that recover EBD records from raw
//! WordprocessingML text: anchor location, record assembly, table
//! segmentation and text extraction.

pub(crate) mod anchor;
pub(crate) mod heading;
pub(crate) mod table;
pub(crate) mod text;
