pub(crate) mod capture;
pub(crate) mod history;
pub(crate) mod model;
