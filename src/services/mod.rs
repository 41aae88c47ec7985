pub mod executor;
pub mod query_gate;
pub mod renderer;
pub mod sampler;
pub mod session;
pub mod summarizer;

pub use executor::StoreExecutor;
pub use renderer::ChartRenderer;
pub use sampler::SamplerService;
pub use session::SessionState;
