mod module_linear;
mod module_softmax;
mod save_package;
