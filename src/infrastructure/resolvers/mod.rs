pub mod local_files;
pub mod postman_api;
