pub mod time;
pub mod validators;
pub mod db_utils;
