pub mod fetch_release;
pub mod premake;
pub mod setup;
pub mod status;
pub mod vulkan;
