use sku_core::{is_promo, strip_promo};

pub fn normalize(sku: &str) -> anyhow::Result<()> {
    let stripped = strip_promo(sku);
    if is_promo(sku) {
        println!("{stripped}  (promo variant of {sku})");
    } else {
        println!("{stripped}");
    }
    Ok(())
}
