pub mod algebra;
pub mod element;
pub mod error;
pub mod history;
pub mod interpret;
pub mod parse;
pub mod registry;
pub mod session;
pub mod sets;
pub mod store;
pub mod visual;

pub use element::Element;
pub use error::{LabError, LabResult};
pub use parse::parse_elements;
pub use registry::{Registry, Snapshot};
pub use session::{Command, Definition, Outcome, Session};
