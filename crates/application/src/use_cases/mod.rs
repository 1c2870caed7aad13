mod forward_queries;

pub use forward_queries::ForwardQueriesUseCase;
