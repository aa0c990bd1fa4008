/// Popup UI for Link & Note Saver

use crate::host::{Capabilities, current_tab};
use crate::render::{list_view, save_enabled, take_save};
use crate::store::ItemStore;
use crate::tab_data::{SavedItem, TabContext};
use crate::ui::components::{CurrentTab, ItemList};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let caps = use_memo((), |_| Capabilities::detect());
    let store = use_memo((), {
        let storage = caps.storage.clone();
        move |_| ItemStore::new(storage)
    });

    let items = use_state(Vec::<SavedItem>::new);
    let loaded = use_state(|| false);
    let tab = use_state(TabContext::default);
    let note = use_state(String::new);

    // Load saved items on mount
    {
        let store = store.clone();
        let items = items.clone();
        let loaded = loaded.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                items.set(store.load().await);
                loaded.set(true);
            });
            || ()
        });
    }

    // Query the active tab on mount, independent of the load
    {
        let caps = caps.clone();
        let tab = tab.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                if let Some(context) = current_tab(caps.tabs.as_ref()).await {
                    tab.set(context);
                }
            });
            || ()
        });
    }

    let on_note_input = {
        let note = note.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlTextAreaElement>() {
                note.set(input.value());
            }
        })
    };

    let savable = save_enabled(*loaded, &tab.url, &note);

    let on_save = {
        let store = store.clone();
        let items = items.clone();
        let loaded = loaded.clone();
        let tab = tab.clone();
        let note = note.clone();

        Callback::from(move |_: MouseEvent| {
            let mut text = (*note).clone();
            let Some(request) = take_save(*loaded, &tab, &mut text) else {
                return;
            };
            note.set(text);

            let store = store.clone();
            let items = items.clone();
            spawn_local(async move {
                store.append(&request.url, &request.title, &request.note).await;
                items.set(store.snapshot());
            });
        })
    };

    let on_delete = {
        let store = store.clone();
        let items = items.clone();

        Callback::from(move |item_id: String| {
            let store = store.clone();
            let items = items.clone();

            spawn_local(async move {
                items.set(store.remove(&item_id).await);
            });
        })
    };

    html! {
        <div class="popup">
            <div class="popup-header">
                <h1 class="popup-title">{"Link & Note Saver"}</h1>
            </div>

            <div class="popup-body">
                <div class="compose-card">
                    <CurrentTab url={tab.url.clone()} />

                    <div class="compose-form">
                        <textarea
                            class="note-input"
                            rows="3"
                            placeholder="Añade una nota..."
                            value={(*note).clone()}
                            oninput={on_note_input}
                        />
                        <Button
                            onclick={on_save}
                            disabled={!savable}
                            variant={ButtonVariant::Primary}
                            block={true}
                        >
                            {"Guardar"}
                        </Button>
                    </div>
                </div>

                <div class="items-scroll">
                    if *loaded {
                        <ItemList list={list_view(&items)} on_delete={on_delete} />
                    } else {
                        <div class="loading-text-center">
                            <Spinner />
                        </div>
                    }
                </div>
            </div>

            <p class="footer-popup">
                {format!("{} guardados", items.len())}
            </p>
        </div>
    }
}
