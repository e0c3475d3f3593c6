mod center;
mod dialogs;
mod icons;
mod side;
mod status;
mod top;
