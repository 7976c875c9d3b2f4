pub mod answer_service;
pub mod embedding_service;
pub mod rag_service;
