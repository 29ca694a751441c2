mod binding;
mod dbms_type;
mod document;
mod entity_stream;
mod field;
mod fragment;
mod naming;
mod operation;
mod optimizer;
mod persist;
mod pipeline;
mod predicate;
mod predicate_view;
mod query_result;
mod row;
mod supplier;
mod transaction;
mod type_map;
mod type_mapper;
mod value;

pub use ::anyhow::Context;
pub use binding::*;
pub use dbms_type::*;
pub use document::*;
pub use entity_stream::*;
pub use field::*;
pub use fragment::*;
pub use naming::*;
pub use operation::*;
pub use optimizer::*;
pub use persist::*;
pub use pipeline::*;
pub use predicate::*;
pub use predicate_view::*;
pub use query_result::*;
pub use row::*;
pub use supplier::*;
pub use transaction::*;
pub use type_map::*;
pub use type_mapper::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
