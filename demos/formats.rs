use mirrormap::{Format, MirrorMap};
use serde_json::json;

fn main() -> Result<(), mirrormap::Error> {
    env_logger::init();

    let dir = std::env::temp_dir();
    for format in Format::ALL {
        let token = format!("profile.{format}");
        let path = dir.join(format!("mirrormap_demo_{token}"));
        let _ = std::fs::remove_file(&path);

        let mut map = MirrorMap::open_at(&token, &path)?;
        map.set("name", "kim");
        map.set("logins", 41);
        map.set("groups", json!(["ops", "dev"]));

        // reopen to show what survives the trip through this format
        let mut reopened = MirrorMap::open_at(&token, &path)?;
        println!("--- {format} ---");
        println!("logins come back as {:?}", reopened.get("logins")?);
        println!("groups come back as {:?}", reopened.get("groups")?);

        let _ = std::fs::remove_file(&path);
    }
    Ok(())
}
