//! Property paths and URL bindings over reflected beans.
//!
//! - [`bean`]: the bean model, type information and the instantiation table.
//! - [`path`]: parsing and evaluating property paths such as `person.addresses[2]['zip']`.
//! - [`url`]: URL binding patterns and the factory that matches request URIs.
//! - [`utils`]: shared hash containers.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use st_bean as bean;
pub use st_path as path;
pub use st_url as url;
pub use st_utils as utils;
