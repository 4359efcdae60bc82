pub mod document;
pub mod domain;
pub mod dto;
