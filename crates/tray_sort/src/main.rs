fn main() {
    tray_sort::run();
}
