pub mod mock;

pub use mock::{MockClusterAligner, MockFunctionPredictor, MockLocalSearch, MockMarkerCaller};
