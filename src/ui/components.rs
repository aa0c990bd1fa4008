/// Reusable UI components

use crate::render::{ItemView, ListView};
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CurrentTabProps {
    pub url: String,
}

#[function_component(CurrentTab)]
pub fn current_tab(props: &CurrentTabProps) -> Html {
    html! {
        <div class="current-tab">
            <p class="current-tab-url" title={props.url.clone()}>
                {format!("URL actual: {}", props.url)}
            </p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ItemCardProps {
    pub item: ItemView,
    pub on_delete: Callback<String>,
}

#[function_component(ItemCard)]
pub fn item_card(props: &ItemCardProps) -> Html {
    let item = &props.item;

    let on_delete = props.on_delete.reform({
        let item_id = item.id.clone();
        move |_: MouseEvent| item_id.clone()
    });

    html! {
        <div class="item-card">
            if let Some(link) = &item.link {
                <a
                    href={link.href.clone()}
                    target="_blank"
                    rel="noopener noreferrer"
                    class="item-link"
                >
                    {&link.text}
                </a>
                if let Some(site) = &link.site {
                    <span class="item-site">{site}</span>
                }
            }
            if let Some(note) = &item.note {
                <p class="item-note">{note}</p>
            }
            <Button onclick={on_delete} variant={ButtonVariant::Link}>
                {"Eliminar"}
            </Button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ItemListProps {
    pub list: ListView,
    pub on_delete: Callback<String>,
}

#[function_component(ItemList)]
pub fn item_list(props: &ItemListProps) -> Html {
    match &props.list {
        ListView::Placeholder(text) => html! {
            <p class="empty-state">{*text}</p>
        },
        ListView::Items(items) => html! {
            <div class="items-list">
                {for items.iter().map(|item| html! {
                    <ItemCard
                        key={item.id.clone()}
                        item={item.clone()}
                        on_delete={props.on_delete.clone()}
                    />
                })}
            </div>
        },
    }
}
