pub mod appointment;
pub mod baseline;
pub mod user;

pub use appointment::{
    ApiReply, Appointment, AppointmentList, AppointmentStatus, BookingRequest, Reminder, SlotBlock,
    SlotList,
};
pub use baseline::{BaselineSetup, BaselineSummary, HighDemandMonth, PeakRow};
pub use user::{Category, ClinicUser, NewClinicUser, Registration, RemoteUser};
