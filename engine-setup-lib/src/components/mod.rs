//! The third-party components an engine checkout needs, in install order.

pub mod premake;
pub mod vulkan;

pub use premake::Premake;
pub use vulkan::VulkanSdk;
