pub mod settings_repo;
