pub mod temp_workspace;
