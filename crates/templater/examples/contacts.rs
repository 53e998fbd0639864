//! Example: render a contact list from a `<template>`
//!
//! Run with `RUST_LOG=templater=trace` to see each mapped selector.

use anyhow::Context;
use templater::{AttributeMapper, ElementMapper, Templater, TemplaterOptions};
use templater_html::{HtmlSerializer, parse};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r##"
<!DOCTYPE html>
<html>
<body>
    <ul id="contacts">
        <template id="contact">
            <li class="contact">
                <a class="name" href="#"></a>
                <span class="email"></span>
                <button class="remove">Remove</button>
            </li>
        </template>
    </ul>
</body>
</html>
"##;

struct Contact {
    name: &'static str,
    email: Option<&'static str>,
    favorite: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let contacts = [
        Contact { name: "Ada Lovelace", email: Some("ada@example.com"), favorite: true },
        Contact { name: "Alan Turing", email: None, favorite: false },
        Contact { name: "Grace Hopper", email: Some("grace@example.com"), favorite: false },
    ];

    let mappers: Vec<ElementMapper> = contacts
        .iter()
        .map(|contact| {
            let mapper = ElementMapper::new()
                .map(
                    "li",
                    AttributeMapper::attrs()
                        .dataset([("name", contact.name)])
                        .toggle_classes([("favorite", contact.favorite)]),
                )
                .map(
                    ".name",
                    AttributeMapper::attrs()
                        .set("textContent", contact.name)
                        .transform("href", |_| None),
                )
                .map(
                    ".remove",
                    AttributeMapper::attrs().on("click", |event| {
                        tracing::info!("remove clicked on {}", event.target);
                    }),
                );
            match contact.email {
                Some(email) => mapper.text(".email", email),
                None => mapper.remove(".email"),
            }
        })
        .collect();

    let mut doc = parse(PAGE).context("parsing page")?;
    let tree = doc.tree_mut();

    let mut templater = Templater::new(tree, "#contact", TemplaterOptions::default())
        .context("creating templater")?;
    templater.instantiate(tree, &mappers);

    let list = templater.container().context("template has no container")?;
    println!("{}", HtmlSerializer::pretty().serialize_outer(tree, list));

    templater.clear(tree);
    println!("after clear: {} children", tree.child_ids(list).len());
    Ok(())
}
