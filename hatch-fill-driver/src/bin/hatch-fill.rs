use hatch_fill_driver::mainloop;

fn main() {
    mainloop();
}
