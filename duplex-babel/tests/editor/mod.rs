mod modes;
mod upload;
