pub mod in_memory;
pub mod moderation;
pub mod scheduler;
