use maud::{html, Markup, PreEscaped};

use super::{link, page, Nav, Notice};

pub fn home() -> Markup {
    page(
        "Welcome",
        Nav::Public,
        None,
        html! {
            div.text-center."mt-5" {
                h1 { "Welcome to the clinic" }
                p.text-muted { "Book appointments, get Telegram reminders and collect loyalty points." }
                a.btn.btn-primary."me-2" href="/login" { "Login" }
                a.btn.btn-outline-primary href="/signup" { "Create account" }
            }
        },
    )
}

pub fn signup(error: Option<&str>) -> Markup {
    page(
        "Sign up",
        Nav::Public,
        None,
        html! {
            div.row.justify-content-center {
                div."col-md-5" {
                    h2."mb-3" { "Create account" }
                    @if let Some(error) = error {
                        div.alert.alert-danger { (error) }
                    }
                    form method="post" action="/signup" {
                        div."mb-3" {
                            label.form-label for="name" { "Username (no spaces)" }
                            input.form-control #name name="name" required;
                        }
                        div."mb-3" {
                            label.form-label for="displayName" { "Display name" }
                            input.form-control #displayName name="displayName" required;
                        }
                        div."mb-3" {
                            label.form-label for="phone" { "Phone" }
                            input.form-control #phone name="phone" type="tel" required;
                        }
                        div."mb-3" {
                            label.form-label for="password" { "Password" }
                            input.form-control #password name="password" type="password" required;
                        }
                        button.btn.btn-primary."w-100" type="submit" { "Sign up" }
                    }
                    p."mt-3" { "Already registered? " a href="/login" { "Login" } }
                }
            }
        },
    )
}

pub fn login(error: Option<&str>) -> Markup {
    page(
        "Login",
        Nav::Public,
        None,
        html! {
            div.row.justify-content-center {
                div."col-md-5" {
                    h2."mb-3" { "Login" }
                    @if let Some(error) = error {
                        div.alert.alert-danger { (error) }
                    }
                    form method="post" action="/login" {
                        div."mb-3" {
                            label.form-label for="name" { "Username" }
                            input.form-control #name name="name" required;
                        }
                        div."mb-3" {
                            label.form-label for="password" { "Password" }
                            input.form-control #password name="password" type="password" required;
                        }
                        button.btn.btn-primary."w-100" type="submit" { "Login" }
                    }
                    p."mt-3" { "New here? " a href="/signup" { "Create an account" } }
                }
            }
        },
    )
}

pub fn connect_telegram(
    name: &str,
    phone: &str,
    bot_url: Option<&str>,
    notice: Option<&Notice>,
) -> Markup {
    let check_url = link("/check-telegram", &[("user", name)]);
    let done_url = link("/user/available", &[("userName", name), ("phone", phone)]);
    let poll = format!(
        "setInterval(async () => {{\
           const r = await fetch({check:?});\
           if (r.ok && (await r.json()).linked) window.location.href = {done:?};\
         }}, 3000);",
        check = check_url,
        done = done_url,
    );

    page(
        "Connect Telegram",
        Nav::Public,
        notice,
        html! {
            div.row.justify-content-center {
                div."col-md-6".text-center {
                    h2 { "Connect Telegram" }
                    p dir="rtl" {
                        "افتح بوت العيادة على تيليغرام واكتب اسم المستخدم الخاص بك لإتمام الربط."
                    }
                    p { "Open the clinic bot on Telegram and send your username:" }
                    p { code."fs-4" { (name) } }
                    @if let Some(bot) = bot_url {
                        a.btn.btn-primary."mb-3" href=(bot) target="_blank" { "Open Telegram bot" }
                    }
                    p.text-muted #tgWaiting { "Waiting for the link… this page continues automatically." }
                    a.btn.btn-outline-secondary href=(done_url) { "Continue" }
                }
            }
            script { (PreEscaped(poll)) }
        },
    )
}
