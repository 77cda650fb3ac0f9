use chrono::FixedOffset;
use maud::{html, Markup};

use super::{link, load_failed, page, Nav, Notice};
use crate::errors::BackendError;
use crate::models::{Appointment, Category, HighDemandMonth, RemoteUser};
use crate::services::format;
use crate::services::listing::{CategoryFilter, PerformanceStats};

pub fn dashboard(
    user: Option<&str>,
    bookings: Option<&Result<Vec<Appointment>, BackendError>>,
    offset: &FixedOffset,
    notice: Option<&Notice>,
) -> Markup {
    page(
        "Attendance",
        Nav::Admin,
        notice,
        html! {
            h2 { "Attendance" }
            form.row."g-2"."mb-3" #attendanceForm method="get" action="/admin/dashboard" {
                div.col {
                    input.form-control #attendanceUser name="user" value=(user.unwrap_or("")) placeholder="Username" required;
                }
                div.col-auto { button.btn.btn-primary type="submit" { "Find bookings" } }
            }
            div #attendanceList {
                @match (user, bookings) {
                    (Some(_), Some(Err(_))) => { (load_failed("appointments")) }
                    (Some(_), Some(Ok(list))) if list.is_empty() => {
                        p { "No booked appointments found for this user." }
                    }
                    (Some(name), Some(Ok(list))) => {
                        @for a in list {
                            div.attendance-card {
                                div.attendance-left {
                                    p.attendance-doctor { (a.doctor_name) }
                                    p.attendance-date { (format::stamp(&a.date, offset)) }
                                }
                                div.attendance-actions {
                                    (status_form(&a.id, name, "attended", "btn-success", "Attended"))
                                    " "
                                    (status_form(&a.id, name, "missed", "btn-danger", "Missed"))
                                }
                            }
                        }
                    }
                    _ => {}
                }
            }
        },
    )
}

fn status_form(id: &str, user: &str, status: &str, class: &str, label: &str) -> Markup {
    html! {
        form.d-inline method="post" action=(format!("/admin/appointments/{id}/status")) {
            input type="hidden" name="status" value=(status);
            input type="hidden" name="user" value=(user);
            button class=(format!("btn {class} btn-sm")) type="submit" { (label) }
        }
    }
}

pub struct AddBlockPage<'a> {
    pub slots: &'a Result<Vec<Appointment>, BackendError>,
    pub doctors: &'a [String],
    pub selected_doctor: Option<&'a str>,
    pub offset: &'a FixedOffset,
    pub notice: Option<&'a Notice>,
}

pub fn add_block(p: AddBlockPage) -> Markup {
    page(
        "Slots",
        Nav::Admin,
        p.notice,
        html! {
            h2 { "Available slots" }
            form.row."g-2"."mb-3" method="get" action="/admin/add-block" {
                div.col {
                    select.form-select #doctorFilter name="doctor" {
                        option value="" { "All Doctors" }
                        @for d in p.doctors {
                            option value=(d) selected[p.selected_doctor == Some(d.as_str())] { (d) }
                        }
                    }
                }
                div.col-auto { button.btn.btn-outline-primary type="submit" { "Filter" } }
            }
            table.table #availableTable {
                thead { tr { th { "Doctor" } th { "Date" } th { "Time" } th { "Status" } th {} } }
                tbody {
                    @match p.slots {
                        Err(_) => { tr { td colspan="5" { (load_failed("slots")) } } }
                        Ok(list) if list.is_empty() => {
                            tr { td.text-center.text-muted colspan="5" { "No available slots" } }
                        }
                        Ok(list) => {
                            @for s in list {
                                tr {
                                    td { (s.doctor_name) }
                                    td { (format::short_date(&s.date, p.offset)) }
                                    td { (format::clock_time(&s.date, p.offset)) }
                                    td { (s.status.as_str()) }
                                    td {
                                        form method="post" action=(format!("/admin/slots/{}/delete", s.id))
                                            onsubmit="return confirm('Are you sure you want to delete this appointment slot?');" {
                                            button.btn.btn-danger."btn-sm" type="submit" { "Delete" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            h3."mt-4" { "Add appointment block" }
            form #addForm method="post" action="/admin/add-block" {
                div.row."g-2" {
                    div."col-md-4" {
                        label.form-label for="doctorName" { "Doctor" }
                        input.form-control #doctorName name="doctorName";
                    }
                    div."col-md-4" {
                        label.form-label for="startDate" { "Start date" }
                        input.form-control #startDate name="startDate" type="date";
                    }
                    div."col-md-4" {
                        label.form-label for="endDate" { "End date (optional)" }
                        input.form-control #endDate name="endDate" type="date";
                    }
                    div."col-md-4" {
                        label.form-label for="startTime" { "Start time" }
                        input.form-control #startTime name="startTime" type="time";
                    }
                    div."col-md-4" {
                        label.form-label for="endTime" { "End time (optional)" }
                        input.form-control #endTime name="endTime" type="time";
                    }
                    div."col-md-4" {
                        label.form-label for="intervalMinutes" { "Interval (minutes)" }
                        input.form-control #intervalMinutes name="intervalMinutes" type="number" min="1" value="60";
                    }
                }
                button.btn.btn-primary."mt-3" type="submit" { "Add slots" }
            }
        },
    )
}

pub fn booked(bookings: &Result<Vec<Appointment>, BackendError>, offset: &FixedOffset) -> Markup {
    page(
        "Booked",
        Nav::Admin,
        None,
        html! {
            h2 { "Booked appointments" }
            div.card-grid #bookedList {
                @match bookings {
                    Err(_) => { (load_failed("booked appointments")) }
                    Ok(list) if list.is_empty() => { p.text-muted { "No booked appointments found." } }
                    Ok(list) => {
                        @for a in list {
                            div.text-center.card.small-card."shadow-sm" {
                                div.card-content {
                                    p { b { (a.doctor_name) } }
                                    p { small { "User: " (a.user_name.as_deref().unwrap_or("-")) } }
                                    p { small { (format::clock_time(&a.date, offset)) } }
                                    p { small { (format::day_label(&a.date, offset, "-")) } }
                                }
                                span.status.booked."mb-2" { "booked" }
                                details."mt-2" {
                                    summary.btn."btn-sm".btn-outline-secondary { "View Reminders" }
                                    @if a.reminders.is_empty() {
                                        small.text-muted { "No reminders" }
                                    }
                                    @for r in &a.reminders {
                                        div.reminder-item {
                                            span.badge.bg-info.text-dark { (r.message_type) }
                                            " "
                                            span class=(format!("badge bg-{}", if r.is_sent() { "success" } else { "warning" })) { (r.status) }
                                            @if let Some(at) = &r.send_time {
                                                small.d-block."mt-1" { (format::stamp(at, offset)) }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

/// Peak-hour data for one month, or why it is missing.
pub enum MonthBaseline {
    Loaded(HighDemandMonth),
    Missing,
    Failed,
}

pub struct BaselinePage<'a> {
    pub doctors: &'a Result<Vec<String>, BackendError>,
    pub selected: Option<(&'a str, i32, &'a [MonthBaseline])>,
    pub notice: Option<&'a Notice>,
}

pub fn baseline(p: BaselinePage) -> Markup {
    page(
        "Peak hours",
        Nav::Admin,
        p.notice,
        html! {
            h2 { "High-demand baselines" }
            div.row #doctorList {
                @match p.doctors {
                    Err(_) => { (load_failed("doctors")) }
                    Ok(list) if list.is_empty() => { p { "No doctors found." } }
                    Ok(list) => {
                        @for doc in list {
                            div."col-md-4"."mb-3" {
                                a.card."p-3".text-center."shadow-sm".text-decoration-none href=(link("/admin/baseline", &[("doctor", doc.as_str())])) {
                                    h5 { (doc) }
                                    p.text-muted { "Click to view monthly baselines" }
                                }
                            }
                        }
                    }
                }
            }
            @if let Some((doctor, year, months)) = p.selected {
                div #monthView {
                    h4."mt-4"."mb-3" { (doctor) }
                    div.row {
                        @for (i, month) in months.iter().enumerate() {
                            @let m = i as u32 + 1;
                            div."col-md-4"."mb-3" {
                                div.card."p-3"."shadow-sm" id=(format!("month-{m}")) {
                                    h6 { (format::month_name(m)) " " (year) }
                                    div.content.text-muted.small {
                                        @match month {
                                            MonthBaseline::Failed => { p.text-danger { "Error loading data." } }
                                            MonthBaseline::Loaded(info) if !info.rows.is_empty() => {
                                                p {
                                                    b { "Baseline Hours: " }
                                                    @for h in info.hours() {
                                                        span.badge.bg-primary."me-1" { (format::to_12_hour(h)) }
                                                    }
                                                }
                                                p { b { "Total Slots: " } (info.summary.total_slots) }
                                                (baseline_form(doctor, year, m, &info.hours(), "Edit Baseline"))
                                            }
                                            _ => {
                                                p { "No baseline data." }
                                                (baseline_form(doctor, year, m, &[], "Add Baseline"))
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn baseline_form(doctor: &str, year: i32, month: u32, hours: &[u32], label: &str) -> Markup {
    let current = hours.iter().map(u32::to_string).collect::<Vec<_>>().join(", ");
    html! {
        form."mt-2" method="post" action="/admin/baseline" {
            input type="hidden" name="doctorName" value=(doctor);
            input type="hidden" name="year" value=(year);
            input type="hidden" name="month" value=(month);
            input.form-control.form-control-sm."mb-1" name="hours" value=(current) placeholder="9, 10, 17"
                title=(format!("تحديد ساعات الذروة للطبيب {doctor} (الشهر {month} / {year})"));
            button.btn."btn-sm".btn-outline-primary type="submit" { (label) }
        }
    }
}

pub struct PerformancePage<'a> {
    pub stats: Option<&'a PerformanceStats>,
    pub users: &'a Result<Vec<RemoteUser>, BackendError>,
    pub search: &'a str,
    pub filter: CategoryFilter,
    pub notice: Option<&'a Notice>,
}

pub fn performance(p: PerformancePage) -> Markup {
    let filters = [
        ("all", "All", p.filter == CategoryFilter::All),
        ("Very Good", "Very Good", p.filter == CategoryFilter::Only(Category::VeryGood)),
        ("Good", "Good", p.filter == CategoryFilter::Only(Category::Good)),
        ("At-Risk", "At-Risk", p.filter == CategoryFilter::Only(Category::AtRisk)),
    ];

    page(
        "Performance",
        Nav::Admin,
        p.notice,
        html! {
            h2 { "Performance" }
            @if let Some(stats) = p.stats {
                div.row."mb-4".text-center {
                    div.col { h3 #availableCount { (stats.available) } small { "Available slots" } }
                    div.col { h3 #bookedCount { (stats.booked) } small { "Booked" } }
                    div.col { h3 #userCount { (stats.users) } small { "Users" } }
                    div.col {
                        div #vgCount { (stats.very_good) " Very Good" }
                        div #gCount { (stats.good) " Good" }
                        div #arCount { (stats.at_risk) " At-Risk" }
                    }
                }
            }
            form.row."g-2"."mb-2" method="get" action="/admin/performance" {
                div.col { input.form-control #userSearch name="q" value=(p.search) placeholder="Search users"; }
                input type="hidden" name="category" value=(filters.iter().find(|f| f.2).map(|f| f.0).unwrap_or("all"));
                div.col-auto { button.btn.btn-outline-primary type="submit" { "Search" } }
            }
            div."mb-3" {
                @for (value, label, active) in filters {
                    @let class = if active { "btn btn-sm btn-secondary me-1 filterBtn active" } else { "btn btn-sm btn-outline-secondary me-1 filterBtn" };
                    a class=(class) href=(link("/admin/performance", &[("q", p.search), ("category", value)])) { (label) }
                }
            }
            table.table {
                thead { tr { th { "User" } th { "Phone" } th { "Attendance" } th { "Category" } } }
                tbody #usersTable {
                    @match p.users {
                        Err(_) => { tr { td colspan="4" { (load_failed("users")) } } }
                        Ok(list) if list.is_empty() => {
                            tr { td.text-center colspan="4" { "No users found" } }
                        }
                        Ok(list) => {
                            @for u in list { (user_row(u)) }
                        }
                    }
                }
            }
        },
    )
}

fn user_row(u: &RemoteUser) -> Markup {
    let badge = u.category.map(|c| c.badge()).unwrap_or("secondary");
    html! {
        tr {
            td { (u.user_name) }
            td { (u.phone.as_deref().unwrap_or("-")) }
            td {
                (u.attended_count) " attended — " (u.missed_count) " missed" br;
                small.text-muted { "Rate: " (format!("{:.2}", u.attendance_rate.unwrap_or(0.0))) "%" } br;
                small.text-info { "Loyalty Points: " (format::points(u.points())) }
            }
            td {
                span class=(format!("badge bg-{badge}")) {
                    (u.category.map(|c| c.as_str()).unwrap_or("Uncategorised"))
                }
                form.d-flex."gap-1"."mt-1" method="post" action="/admin/set-category" {
                    input type="hidden" name="userName" value=(u.user_name);
                    select.form-select.form-select-sm name="category" {
                        @for c in Category::ALL {
                            option value=(c.as_str()) selected[u.category == Some(c)] { (c.as_str()) }
                        }
                    }
                    button.btn."btn-sm".btn-outline-dark type="submit" { "Save" }
                }
            }
        }
    }
}
