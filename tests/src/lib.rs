//! Cross-crate tests exercising the full pattern-to-artifact pipeline.

#[cfg(test)]
mod compile_pipeline;
#[cfg(test)]
mod reference_semantics;
