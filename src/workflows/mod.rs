pub mod leads;
pub mod support;
pub mod timeframe;
