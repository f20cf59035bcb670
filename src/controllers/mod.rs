pub mod fleet_controller;
