pub mod mock_sources;
pub mod utils;
