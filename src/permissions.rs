//! Storage permission state.
//!
//! Permissions are queried once per event and passed to the coordinator as
//! an immutable value; there is no ambient mutable permission state. A
//! capture evaluated against a state captured before a permission request
//! resolves still sees the old value, so callers re-query per event to
//! narrow that window.

/// Immutable snapshot of the storage permissions granted to the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionState {
    pub read_granted: bool,
    pub write_granted: bool,
}

impl PermissionState {
    pub fn granted() -> Self {
        Self {
            read_granted: true,
            write_granted: true,
        }
    }
}

/// Queries the platform for the current storage permission state
///
/// On capability-scoped platforms (Android API >= 29 and all desktop
/// targets) writes to self-created media are implicitly allowed, so
/// `write_granted` is true there even without the legacy write permission.
pub fn query_permissions() -> PermissionState {
    #[cfg(target_os = "android")]
    {
        android::query_permissions()
    }

    #[cfg(not(target_os = "android"))]
    {
        PermissionState::granted()
    }
}

/// Requests the legacy write permission and resolves to a fresh state
///
/// No pending save is retried when the grant arrives; the user re-triggers
/// the action.
pub async fn request_write_permission() -> PermissionState {
    #[cfg(target_os = "android")]
    {
        android::request_write_permission().await
    }

    #[cfg(not(target_os = "android"))]
    {
        query_permissions()
    }
}

#[cfg(target_os = "android")]
mod android {
    use super::PermissionState;
    use jni::objects::{JObject, JValue};
    use jni::JavaVM;

    const PERMISSION_GRANTED: i32 = 0;
    const READ_EXTERNAL_STORAGE: &str = "android.permission.READ_EXTERNAL_STORAGE";
    const WRITE_EXTERNAL_STORAGE: &str = "android.permission.WRITE_EXTERNAL_STORAGE";

    fn check_permission(permission: &str) -> Option<bool> {
        unsafe {
            let ctx = ndk_context::android_context();
            let vm = JavaVM::from_raw(ctx.vm().cast()).ok()?;
            let mut env = vm.attach_current_thread().ok()?;
            let context = JObject::from_raw(ctx.context().cast());
            let name = env.new_string(permission).ok()?;
            let result = env
                .call_method(
                    context,
                    "checkSelfPermission",
                    "(Ljava/lang/String;)I",
                    &[JValue::Object(&JObject::from(name))],
                )
                .ok()?
                .i()
                .ok()?;
            Some(result == PERMISSION_GRANTED)
        }
    }

    fn sdk_int() -> Option<i32> {
        unsafe {
            let ctx = ndk_context::android_context();
            let vm = JavaVM::from_raw(ctx.vm().cast()).ok()?;
            let mut env = vm.attach_current_thread().ok()?;
            let version = env.find_class("android/os/Build$VERSION").ok()?;
            env.get_static_field(version, "SDK_INT", "I").ok()?.i().ok()
        }
    }

    pub fn query_permissions() -> PermissionState {
        let read_granted = check_permission(READ_EXTERNAL_STORAGE).unwrap_or(false);
        let has_write = check_permission(WRITE_EXTERNAL_STORAGE).unwrap_or(false);
        // API 29+ scopes storage; writes to self-created media need no grant
        let scoped = sdk_int().map(|v| v >= 29).unwrap_or(false);
        PermissionState {
            read_granted,
            write_granted: has_write || scoped,
        }
    }

    pub async fn request_write_permission() -> PermissionState {
        // The permission dialog belongs to the host activity; from here we
        // can only re-query once the caller comes back around.
        log::warn!("Write permission missing; host activity must request it");
        query_permissions()
    }
}
