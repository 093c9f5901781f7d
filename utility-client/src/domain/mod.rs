pub mod bill;
pub mod customer;
pub mod month;

pub use bill::{watts_to_kilowatts, Address, Bill, Meter, MeterType, WATTS_PER_KILOWATT};
pub use customer::{Customer, CustomerId, CustomerState};
pub use month::{CalendarMonth, MonthlyPredictions};
