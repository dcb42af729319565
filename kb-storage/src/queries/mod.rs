pub mod codec;
pub mod dialog_crud;
pub mod feedback_ops;
pub mod solution_ops;
pub mod vector_search;
