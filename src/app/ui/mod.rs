mod controls;
mod notes;
mod panels;
