mod dbms_type;
mod mappers;
mod naming;
mod predicate_view;
mod type_map;

pub use dbms_type::*;
pub use mappers::*;
pub use naming::*;
pub use predicate_view::*;
pub use type_map::*;
