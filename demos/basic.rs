use mirrormap::MirrorMap;
use serde_json::json;

fn main() -> Result<(), mirrormap::Error> {
    // RUST_LOG=debug shows the write-through chatter
    env_logger::init();

    let path = std::env::temp_dir().join("mirrormap_demo_basic.yaml");
    let _ = std::fs::remove_file(&path);
    let mut map = MirrorMap::open_at("inventory.yaml", &path)?;

    // every set lands on disk right away
    map.set("apples", 3);
    map.set("bananas", 5);
    map.set("restock", json!({"apples": [10, 20], "urgent": false}));

    println!("apples  = {:?}", map.get("apples")?);
    println!("keys    = {:?}", map.keys());

    // bananas and restock are still unread
    let (changed, keys) = map.item_changed();
    println!("changed = {changed}, unread = {keys:?}");

    // a full sweep empties the ledger
    for (key, value) in map.items() {
        println!("  {key} = {value}");
    }
    let (changed, _) = map.item_changed();
    println!("after items(): changed = {changed}");

    println!("\non disk:\n{}", std::fs::read_to_string(&path)?);

    let _ = std::fs::remove_file(&path);
    Ok(())
}
