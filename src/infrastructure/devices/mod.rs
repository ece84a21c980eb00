mod native;

pub use native::NativeDeviceEnumerator;
