use crate::airports::AirportDirectory;

pub struct AppState {
    pub directory: AirportDirectory,
}
