use leptos::prelude::*;

use crate::models::Role;

#[component]
pub fn RoleBadge(role: Signal<Option<Role>>) -> impl IntoView {
    move || {
        role.get().map(|role| {
            let class = match role {
                Role::Admin => "role-badge role-admin",
                Role::Member => "role-badge role-member",
            };
            view! { <span class=class>{role.label()}</span> }
        })
    }
}
