use chrono::FixedOffset;
use maud::{html, Markup};

use super::{link, load_failed, page, Identity, Nav, Notice};
use crate::errors::BackendError;
use crate::models::{Appointment, AppointmentStatus, RemoteUser};
use crate::services::format;
use crate::services::listing::{DoctorCard, PastFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelegramStatus {
    Linked,
    NotLinked,
    Unknown,
}

pub struct AvailablePage<'a> {
    pub identity: &'a Identity,
    pub display_name: &'a str,
    pub telegram: TelegramStatus,
    pub upcoming: &'a Result<Vec<Appointment>, BackendError>,
    pub offset: &'a FixedOffset,
    pub notice: Option<&'a Notice>,
}

pub fn available(p: AvailablePage) -> Markup {
    let connect = link(
        "/connect-telegram",
        &[("name", p.identity.user_name.as_str()), ("phone", p.identity.phone.as_str())],
    );

    page(
        "My appointments",
        Nav::User(p.identity),
        p.notice,
        html! {
            h2 { "Hello, " (p.display_name) }
            div."mb-3" #telegramStatus {
                @match p.telegram {
                    TelegramStatus::Linked => {
                        span.text-success { "✅ Telegram connected – you will receive reminders." }
                    }
                    TelegramStatus::NotLinked => {
                        span.text-warning { "⚠️ Telegram NOT connected yet." }
                        br;
                        a.btn."btn-sm".btn-warning."mt-2" href=(connect) { "Connect Telegram" }
                    }
                    TelegramStatus::Unknown => {
                        span.text-danger { "❌ Unable to check Telegram status." }
                    }
                }
            }
            h4 { "Upcoming appointments" }
            div #appointmentBox {
                @match p.upcoming {
                    Err(_) => { (load_failed("appointments")) }
                    Ok(list) if list.is_empty() => { p { "No upcoming appointments." } }
                    Ok(list) => {
                        @for app in list { (booked_card(app, p.offset)) }
                    }
                }
            }
            a.btn.btn-primary."mt-3" #bookBtn href=(p.identity.link("/user/doctors")) { "Book an appointment" }
        },
    )
}

fn booked_card(app: &Appointment, offset: &FixedOffset) -> Markup {
    html! {
        div.card.small-card {
            div.card-content {
                p { b { (app.doctor_name) } }
                p { small { (format::clock_time(&app.date, offset)) } }
                p { small { (format::day_label(&app.date, offset, "-")) } }
            }
            span.status.booked { (AppointmentStatus::Booked.as_str()) }
        }
    }
}

pub fn booked(
    identity: &Identity,
    booked: &Result<Vec<Appointment>, BackendError>,
    offset: &FixedOffset,
) -> Markup {
    page(
        "Booked",
        Nav::User(identity),
        None,
        html! {
            h2 { "My booked appointments" }
            div.card-grid #bookedList {
                @match booked {
                    Err(_) => { (load_failed("booked appointments")) }
                    Ok(list) if list.is_empty() => { p { "No booked appointments." } }
                    Ok(list) => {
                        @for app in list { (booked_card(app, offset)) }
                    }
                }
            }
            a.btn.btn-primary."mt-3" href=(identity.link("/user/doctors")) { "Book an appointment" }
        },
    )
}

pub fn doctors(
    identity: &Identity,
    doctors: &Result<Vec<DoctorCard>, BackendError>,
    search: &str,
    notice: Option<&Notice>,
) -> Markup {
    page(
        "Doctors",
        Nav::User(identity),
        notice,
        html! {
            h2 { "Choose a doctor" }
            form.row."g-2"."mb-3" method="get" action="/user/doctors" {
                input type="hidden" name="userName" value=(identity.user_name);
                input type="hidden" name="phone" value=(identity.phone);
                div.col { input.form-control #search name="q" value=(search) placeholder="Search doctors"; }
                div.col-auto { button.btn.btn-outline-primary type="submit" { "Search" } }
            }
            div.card-grid #doctorList {
                @match doctors {
                    Err(_) => { (load_failed("doctors")) }
                    Ok(list) if list.is_empty() => { p { "No available doctors found." } }
                    Ok(list) => {
                        @for d in list {
                            div.doctor-card {
                                a href=(identity.link_with("/user/times", &[("doctor", d.name.as_str())])) {
                                    h5 { (d.name) }
                                    small.text-muted { (d.specialty) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn times(
    identity: &Identity,
    doctor: &str,
    slots: &Result<Vec<Appointment>, BackendError>,
    offset: &FixedOffset,
    notice: Option<&Notice>,
) -> Markup {
    page(
        "Times",
        Nav::User(identity),
        notice,
        html! {
            h2 { (doctor) }
            div.card-grid #slots {
                @match slots {
                    Err(_) => { (load_failed("times")) }
                    Ok(list) if list.is_empty() => { p { "No available times right now." } }
                    Ok(list) => {
                        @for s in list {
                            div.time-card {
                                div.time-content {
                                    p.time-hour { (format::clock_time(&s.date, offset)) }
                                    p.time-date { (format::day_label(&s.date, offset, "•")) }
                                }
                                form method="post" action=(format!("/user/book/{}", s.id)) {
                                    input type="hidden" name="userName" value=(identity.user_name);
                                    input type="hidden" name="phone" value=(identity.phone);
                                    input type="hidden" name="doctor" value=(doctor);
                                    button.btn.btn-primary."btn-sm"."w-100"."mt-2" type="submit" { "Book" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn past(
    identity: &Identity,
    past: &Result<Vec<Appointment>, BackendError>,
    filter: PastFilter,
    offset: &FixedOffset,
) -> Markup {
    let tabs = [
        (PastFilter::All, "All", "primary"),
        (PastFilter::Attended, "Attended", "success"),
        (PastFilter::Missed, "Missed", "danger"),
    ];

    page(
        "History",
        Nav::User(identity),
        None,
        html! {
            h2 { "Past appointments" }
            div.d-flex.justify-content-center."gap-2"."mb-3".flex-wrap {
                @for (f, label, tone) in tabs {
                    @let class = if f == filter { format!("btn btn-{tone} btn-sm") } else { format!("btn btn-outline-{tone} btn-sm") };
                    a class=(class) href=(identity.link_with("/user/past", &[("filter", f.as_str())])) { (label) }
                }
            }
            div #pastList {
                @match past {
                    Err(_) => { (load_failed("past appointments")) }
                    Ok(list) if list.is_empty() => { p { "No appointments found for this filter." } }
                    Ok(list) => {
                        @for app in list {
                            @let tone = match app.status {
                                AppointmentStatus::Attended => "success",
                                AppointmentStatus::Missed => "danger",
                                _ => "secondary",
                            };
                            div.past-card {
                                div.past-left {
                                    p.past-doctor { (app.doctor_name) }
                                    p.past-date { (format::day_label(&app.date, offset, "•")) }
                                    p.past-time { (format::clock_time(&app.date, offset)) }
                                }
                                span class=(format!("badge bg-{tone} past-badge")) { (app.status.as_str()) }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub const REWARDS: [(u32, &str); 3] = [
    (10, "5% Discount on next appointment"),
    (20, "One Free Clinic Service"),
    (30, "Premium Priority Appointment Slot"),
];

pub fn loyalty(identity: &Identity, user: &Result<Option<RemoteUser>, BackendError>) -> Markup {
    page(
        "Points",
        Nav::User(identity),
        None,
        html! {
            h2 { "Loyalty points" }
            div #pointsInfo {
                @match user {
                    Err(_) => { (load_failed("your points")) }
                    Ok(user) => {
                        @let score = user.as_ref().map(RemoteUser::points).unwrap_or(0.0);
                        h4 { (format::points(score)) " Points" }
                        div.reward-card-list."mt-3" {
                            @for (pts, desc) in REWARDS {
                                div.reward-card {
                                    div.reward-points { (pts) " pts" }
                                    div.reward-desc { (desc) }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
