pub mod relay_command;
