//! # Query Engine
//!
//! Turns a listing request's query string into a storage-agnostic
//! [`QuerySpec`] and runs it against a [`Repository`].
//!
//! ```text
//! ?price[gte]=10&keyword=phone&sort=-price&fields=title,price&page=2&limit=5
//!     │
//!     ├─ FilterSet    price ≥ 10
//!     ├─ SearchClause "phone" in the resource's search fields
//!     ├─ SortSpec     price descending
//!     ├─ Projection   title, price (+ _id)
//!     └─ Pagination   offset 5, limit 5
//! ```
//!
//! [`execute`] fetches the page and the total count concurrently and returns
//! a [`PageResult`]. Two repositories ship with the crate:
//! [`InMemoryRepository`] and [`MongoRepository`].

pub mod error;
pub mod filter;
pub mod memory;
pub mod mongo;
pub mod pagination;
pub mod pipeline;
pub mod projection;
pub mod repository;
pub mod search;
pub mod sort;
pub mod spec;

pub use error::{QueryError, StorageError};
pub use filter::{Condition, FilterSet, RangeOp};
pub use memory::InMemoryRepository;
pub use mongo::MongoRepository;
pub use pagination::{DEFAULT_LIMIT, PageResult, Pagination};
pub use pipeline::execute;
pub use projection::Projection;
pub use repository::{CollectionSchema, Document, Populate, Repository, StorageResult};
pub use search::SearchClause;
pub use sort::{SortDirection, SortField, SortSpec};
pub use spec::{Criteria, QuerySpec};
