pub mod fleet_dto;
