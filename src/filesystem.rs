use std::path::PathBuf;

#[cfg(target_os = "android")]
fn android_files_dir() -> Option<PathBuf> {
    use jni::{
        objects::{JObject, JString},
        JavaVM,
    };
    unsafe {
        let ctx = ndk_context::android_context();
        let vm = JavaVM::from_raw(ctx.vm().cast()).ok()?;
        let mut env = vm.attach_current_thread().ok()?; // mutable for JNI calls
        let activity = JObject::from_raw(ctx.context().cast());
        let files_dir = env
            .call_method(activity, "getFilesDir", "()Ljava/io/File;", &[])
            .ok()?
            .l()
            .ok()?;
        let abs_path_obj = env
            .call_method(files_dir, "getAbsolutePath", "()Ljava/lang/String;", &[])
            .ok()?
            .l()
            .ok()?;
        let abs_path_jstring: JString = JString::from(abs_path_obj);
        let abs_path: String = env.get_string(&abs_path_jstring).ok()?.into();
        Some(PathBuf::from(abs_path).join("photos"))
    }
}

/// Private photo directory for the current platform
///
/// Accessible only to this app; removed with it on uninstall.
pub fn private_photos_dir() -> PathBuf {
    #[cfg(target_os = "android")]
    {
        if let Some(dir) = android_files_dir() {
            return dir;
        }
        // Fallbacks
        for d in [
            "/data/user/0/dev.photovault.app/files",
            "/data/data/dev.photovault.app/files",
        ] {
            let p = PathBuf::from(d);
            if p.exists() {
                return p.join("photos");
            }
        }
        PathBuf::from("./data/photos")
    }

    #[cfg(not(target_os = "android"))]
    {
        // On desktop, use ./data/photos
        PathBuf::from("./data/photos")
    }
}

/// Shared pictures directory backing the media catalog stand-in
pub fn shared_pictures_dir() -> PathBuf {
    #[cfg(target_os = "android")]
    {
        PathBuf::from("/storage/emulated/0/Pictures")
    }

    #[cfg(not(target_os = "android"))]
    {
        PathBuf::from("./pictures")
    }
}
