//! View containers. Each owns its local UI state (page, search text, modal)
//! and binds it to cache queries and mutations; none of them draw anything.

pub mod dashboard;
pub mod doctors;
pub mod login;
pub mod patients;
pub mod render;
pub mod resource;
pub mod search;
pub mod verification;

pub use dashboard::{Dashboard, DashboardView};
pub use doctors::{DoctorDetail, DoctorsList};
pub use login::{LoginForm, LoginView, Redirect};
pub use patients::{PatientDetail, PatientsList};
pub use render::{DetailView, ListPage, ListView, ToggleButton};
pub use resource::{Resource, ResourceDetail, ResourceList};
pub use search::SearchPager;
pub use verification::VerificationRequests;
