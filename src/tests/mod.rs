// Test modules

mod query_gate_test;
mod renderer_test;
mod session_test;
mod summarizer_test;
