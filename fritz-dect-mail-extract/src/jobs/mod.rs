pub mod extraction_manager;
