/// Generation metadata module
///
/// This module handles:
/// - Summarizing generation graphs (prompts, sampler settings)
/// - Turning the raw metadata bag into displayable entries

pub mod display;
pub mod extract;
