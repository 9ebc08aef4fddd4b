pub mod capture_service;
