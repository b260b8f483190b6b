use anyhow::Result;
use painto_application::Storefront;
use painto_core::locale::Locale;

pub fn show(storefront: &Storefront) -> Result<()> {
    let state = storefront.localization().current();
    let attributes = state.document_attributes();
    println!(
        "{} {} ({})",
        state.locale.flag(),
        state.locale.display_name(),
        state.locale
    );
    println!("dir={} lang={} body={}", attributes.dir, attributes.lang, attributes.body_class());
    Ok(())
}

pub async fn set(storefront: &Storefront, locale: Locale) -> Result<()> {
    if storefront.switch_locale(locale).await {
        println!("Switched to {} ({})", locale.display_name(), locale);
    } else {
        println!("{} is already active", locale.display_name());
    }
    Ok(())
}

pub fn list(storefront: &Storefront) -> Result<()> {
    let active = storefront.localization().locale();
    for locale in storefront.localization().available_locales() {
        let marker = if *locale == active { "*" } else { " " };
        println!(
            "{} {} {} ({}, {})",
            marker,
            locale.flag(),
            locale.display_name(),
            locale,
            locale.direction()
        );
    }
    Ok(())
}
