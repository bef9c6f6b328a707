//! Conversion orchestration service.

mod convert;

pub use convert::{ConversionError, ConversionResult, ConversionService, ConvertDefectRequest};
