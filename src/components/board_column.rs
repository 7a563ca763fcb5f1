use leptos::prelude::*;
use leptos_dragdrop::{make_on_column_mouseenter, make_on_mouseleave, DndSignals};

use crate::board::TaskBoard;
use crate::components::TaskCard;
use crate::models::{pluralize, Task, TaskStatus};

/// One status column; also the drop target for that status
#[component]
pub fn BoardColumn(
    status: TaskStatus,
    board: RwSignal<TaskBoard>,
    dnd: DndSignals<TaskStatus>,
    #[prop(into)] on_status_change: Callback<(u32, TaskStatus)>,
    #[prop(into)] on_edit: Callback<Task>,
) -> impl IntoView {
    let tasks = Memo::new(move |_| board.with(|b| b.by_status(status)));
    let class = move || {
        if dnd.is_over(status) {
            format!("board-column {} drop-target", status.css_class())
        } else {
            format!("board-column {}", status.css_class())
        }
    };

    view! {
        <section
            class=class
            on:mouseenter=make_on_column_mouseenter(dnd, status)
            on:mouseleave=make_on_mouseleave(dnd)
        >
            <header class="board-column-header">
                <h3>{status.label()}</h3>
                <span class="column-count">{move || pluralize(tasks.with(|t| t.len()), "task")}</span>
            </header>
            <div class="board-column-body">
                {move || {
                    let list = tasks.get();
                    if list.is_empty() {
                        view! { <p class="column-empty">"No tasks"</p> }.into_any()
                    } else {
                        list.into_iter()
                            .map(|task| {
                                let id = task.id;
                                let pending = Signal::derive(move || board.with(|b| b.is_pending(id)));
                                view! {
                                    <TaskCard
                                        task=task
                                        pending=pending
                                        dnd=dnd
                                        on_status_change=on_status_change
                                        on_edit=on_edit
                                    />
                                }
                            })
                            .collect_view()
                            .into_any()
                    }
                }}
            </div>
        </section>
    }
}
